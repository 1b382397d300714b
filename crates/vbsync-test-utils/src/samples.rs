//! Component texts as the host exports them: CRLF line endings, framing
//! included.

/// Standard module `Module1`.
pub const MODULE1: &str = "Attribute VB_Name = \"Module1\"\r\n\
Option Explicit\r\n\
\r\n\
Public Sub Main()\r\n\
    MsgBox \"Hello\"\r\n\
End Sub\r\n";

/// Class module `Shape` with the standard class header.
pub const SHAPE_CLASS: &str = "VERSION 1.0 CLASS\r\n\
BEGIN\r\n\
  MultiUse = -1  'True\r\n\
END\r\n\
Attribute VB_Name = \"Shape\"\r\n\
Attribute VB_GlobalNameSpace = False\r\n\
Attribute VB_Creatable = False\r\n\
Attribute VB_PredeclaredId = False\r\n\
Attribute VB_Exposed = False\r\n\
Option Explicit\r\n\
\r\n\
Public Width As Double\r\n\
\r\n\
Public Function Area() As Double\r\n\
    Area = Width * Width\r\n\
End Function\r\n";

/// User form `UserForm1` with a designer block.
pub const USER_FORM: &str = "VERSION 5.00\r\n\
Begin {C62A69F0-16DC-11CE-9E98-00AA00574A4F} UserForm1\r\n\
   Caption         =   \"Settings\"\r\n\
   ClientHeight    =   3015\r\n\
   ClientWidth     =   4560\r\n\
End\r\n\
Attribute VB_Name = \"UserForm1\"\r\n\
Attribute VB_GlobalNameSpace = False\r\n\
Attribute VB_Creatable = False\r\n\
Attribute VB_PredeclaredId = True\r\n\
Attribute VB_Exposed = False\r\n\
Private Sub UserForm_Initialize()\r\n\
    Me.Caption = \"Settings\"\r\n\
End Sub\r\n";

/// Document module `ThisDocument`.
pub const THIS_DOCUMENT: &str = "VERSION 1.0 CLASS\r\n\
BEGIN\r\n\
  MultiUse = -1  'True\r\n\
END\r\n\
Attribute VB_Name = \"ThisDocument\"\r\n\
Attribute VB_GlobalNameSpace = False\r\n\
Attribute VB_Creatable = False\r\n\
Attribute VB_PredeclaredId = True\r\n\
Attribute VB_Exposed = True\r\n\
Private Sub Document_DocumentOpened(ByVal doc As IVDocument)\r\n\
End Sub\r\n";

/// Editor text of a standard module: name attribute plus `code`, LF endings.
pub fn module_source(name: &str, code: &str) -> String {
    format!("Attribute VB_Name = \"{}\"\n{}", name, code)
}

/// Host text of a standard module: name attribute plus `code`, CRLF endings.
pub fn module_export(name: &str, code: &str) -> String {
    let mut out = format!("Attribute VB_Name = \"{}\"\r\n", name);
    for line in code.lines() {
        out.push_str(line);
        out.push_str("\r\n");
    }
    out
}
